pub mod bootstrap;
pub mod coordinator;
pub mod db;
pub mod grouping;
pub mod profile;
pub mod remote;
