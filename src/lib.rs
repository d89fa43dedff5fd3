//! Back end for a community food cupboard: people, households, food banks
//! and visits behind stateless encrypted session tokens, with email-based
//! password reset.

pub mod clock;
pub mod config;
pub mod db;
pub mod email;
pub mod error;
pub mod routes;
pub mod state;
pub mod store;
pub mod testing;

pub mod crypto {
    pub mod aes;
    pub mod password;
    pub mod session;
}

pub mod models;
pub mod repositories;

pub mod services {
    pub mod auth;
    pub mod pantry;
    pub mod persons;
    pub mod reset;
}

pub mod handlers {
    pub mod auth;
    pub mod food_banks;
    pub mod households;
    pub mod persons;
}

pub mod middleware_layer {
    pub mod auth;
}

pub mod validation {
    pub mod auth;
}
