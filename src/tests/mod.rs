mod bot_flow_tests;
mod utils;
