mod body;
mod naming;
mod orchestrator;
mod parameters;
mod support;
