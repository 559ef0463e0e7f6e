pub mod env;
pub mod ssm;
