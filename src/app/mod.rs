// Application layer: wires the CLI configuration to the archive and upload components.

pub mod upload_directory;

pub use upload_directory::run;
