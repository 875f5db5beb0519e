pub mod ask_request;
