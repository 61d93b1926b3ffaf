pub mod automations;
pub mod workflows;
