pub mod dto;
pub mod entity;
pub mod image;
pub mod service;
