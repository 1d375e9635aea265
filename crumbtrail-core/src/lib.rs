pub mod crawl;
pub mod error;
pub mod hierarchy;
pub mod report;

pub use error::ReportError;

pub fn print_banner() {
    eprintln!(
        r#"
   ___ _ __ _   _ _ __ ___ | |_ _ __ __ _(_) |
  / __| '__| | | | '_ ` _ \| __| '__/ _` | | |
 | (__| |  | |_| | | | | | | |_| | | (_| | | |
  \___|_|   \__,_|_| |_| |_|\__|_|  \__,_|_|_|
            v{}
"#,
        env!("CARGO_PKG_VERSION")
    );
}
