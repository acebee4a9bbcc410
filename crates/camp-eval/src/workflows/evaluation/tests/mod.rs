mod common;
mod layout;
