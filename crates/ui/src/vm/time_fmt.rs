pub use quiz_core::time::format_elapsed;
