//! Fatal error reporting

use tracing::error;

/// Print the error and exit with the code its kind maps to.
///
/// Crate errors use [`crate::Error::exit_code`]; anything else exits with 1.
/// With `verbose >= 1` the full cause chain is printed as well.
pub fn handle_fatal_error(error: anyhow::Error, verbose: u8) -> ! {
    use crate::error::Error;

    error!("Fatal error: {}", error);

    let exit_code = match error.downcast_ref::<Error>() {
        Some(Error::Identity(message)) => {
            eprintln!("{message}");
            2
        }
        Some(quiz_err) => {
            eprintln!("Error: {quiz_err}");
            quiz_err.exit_code()
        }
        None => {
            eprintln!("Error: {error}");
            1
        }
    };

    if verbose >= 1 {
        eprintln!("\nError chain:");
        for (i, cause) in error.chain().enumerate() {
            eprintln!("  {}: {}", i, cause);
        }
    }

    std::process::exit(exit_code)
}
