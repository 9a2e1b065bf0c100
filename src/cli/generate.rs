use crate::{
    config::Settings,
    error::Vex2DocError,
    report::generate_document,
    vex::VexSource,
};
use tracing::{debug, info, warn};

/// Validate settings, parse the VEX file and publish the report.
///
/// Returns `-1` when the arguments are incomplete and `0` otherwise,
/// including when the input file does not exist.
pub fn generate_command<S: VexSource>(settings: &Settings, parser: &mut S) -> crate::Result<i32> {
    if let Err(e) = settings.validate() {
        debug!("Invalid arguments: {}", e);
        println!("[ERROR] {}", e);
        return Ok(-1);
    }

    let input_file = settings.input_path();
    let output_file = settings.output_path();

    if settings.debug {
        println!("Input file {}", settings.input_file);
        println!("Output file {}", settings.output_file);
    }

    match parser.parse(&input_file) {
        Ok(()) => {}
        Err(Vex2DocError::FileNotFound(path)) => {
            warn!("Input file missing, nothing generated: {}", path);
            println!("{} not found", path);
            return Ok(0);
        }
        Err(e) => return Err(e),
    }

    info!(
        "Rendering {} as {}",
        input_file,
        settings.format.as_str()
    );

    let mut document = settings.format.builder();
    generate_document(
        parser,
        document.as_mut(),
        &settings.input_file,
        output_file.as_deref(),
        settings.columns,
    )?;

    Ok(0)
}
