pub mod dto;
pub mod entity;
pub mod resolver;
pub mod service;
