mod datasource;
pub mod prelude;
pub mod sql;
