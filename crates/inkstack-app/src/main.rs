//! Command line entry point.

use std::process::ExitCode;

fn main() -> ExitCode {
    env_logger::init();

    let args = match inkstack_app::parse_args(std::env::args().skip(1)) {
        Ok(args) => args,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::from(2);
        }
    };

    log::info!("Replaying {}", args.script.display());
    match inkstack_app::run(&args) {
        Ok(report) => {
            log::info!(
                "{} shapes, {} undoable and {} redoable operations",
                report.shapes,
                report.undo_depth,
                report.redo_depth
            );
            println!("{}", report.history_path.display());
            println!("{}", report.image_path.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("{e}");
            ExitCode::FAILURE
        }
    }
}
