use schematic_importer::{BlockRegistry, ImportOptions, Importer, MemoryScene};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

fn main() -> ExitCode {
    init_logging();

    let mut args = std::env::args().skip(1);
    let Some(schematic) = args.next().map(PathBuf::from) else {
        eprintln!("Usage: import-schematic <file.schematic> [project_root] [options.json]");
        return ExitCode::from(2);
    };
    let project_root = args.next().map(PathBuf::from);
    let options_path = args.next().map(PathBuf::from);

    let mut options = match options_path {
        Some(path) => match ImportOptions::from_file(&path) {
            Ok(options) => options,
            Err(e) => {
                error!(path = %path.display(), error = %e, "could not load options");
                return ExitCode::FAILURE;
            }
        },
        None => ImportOptions::default(),
    };
    if let Some(root) = project_root {
        options = options.with_project_root(root);
    }

    let assets = options.assets();
    let mut scene = MemoryScene::new();
    let mut importer = Importer::from_options(BlockRegistry::default(), &options);

    let report = match importer.import_path(&mut scene, &assets, &schematic) {
        Ok(report) => report,
        Err(e) => {
            error!(file = %schematic.display(), error = %e, "import aborted");
            return ExitCode::FAILURE;
        }
    };

    for failure in &report.errors {
        warn!(
            index = failure.index,
            position = %failure.position,
            block_id = failure.block_id,
            texture = failure.error.texture_name(),
            "block not imported"
        );
    }
    info!(
        objects = report.object_count(),
        materials = scene.material_count(),
        textures = scene.texture_count(),
        errors = report.errors.len(),
        unknown = report.unknown_cells,
        "done"
    );

    if report.is_clean() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
