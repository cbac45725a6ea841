//! End-to-end tests at the HTTP request/response level.
//!
//! Each test file covers a specific scenario, driving the full router
//! (middleware included) with deterministic inputs and a manual clock.

#![cfg(test)]

mod helpers;

mod test_add_item_validation;
mod test_authorization;
mod test_delete_all;
mod test_item_crud;
mod test_login;
mod test_many_inserts;
mod test_register;
mod test_welcome;
