//! Menubot core library: config, reply dispatcher, WhatsApp channel and webhook gateway,
//! used by the `menubot` CLI.

pub mod channels;
pub mod config;
pub mod dispatch;
pub mod gateway;
