//! Integration tests

mod test_client;
mod test_dispatcher;
