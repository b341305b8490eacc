pub mod channel_launcher;
pub mod process_restart;
pub mod simulated_nfc;
pub mod simulated_terminal;
