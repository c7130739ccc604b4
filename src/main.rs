use clap::Arg;
use indexmap::IndexMap;
use itertools::Itertools;
use std::io::Write;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use hge_scene_check::checks::corrupt_names;
use hge_scene_check::export::{collect_manifest, ensure_export_markers, plan_export_names};
use hge_scene_check::names::NO_INHERIT;
use hge_scene_check::stats::SceneStatistics;
use hge_scene_check::utils::object_name;
use hge_scene_check::{Scene, Settings, Validator};

const SCENE_EXTENSION: &str = ".scene.toml";

fn main() {
    let cli_matches = clap::App::new("HGE Scene Checker")
        .version("1.0")
        .about(
            "Checks the export setup (roles, names, LODs, spots, surfaces and animations) \
             of scene snapshots before they go to the asset processor.",
        )
        .arg(Arg::with_name("summary").long("summary").takes_value(false).help(
            "Outputs a one-line summary for each scene passed in, rather than all errors.",
        ))
        .arg(Arg::with_name("names").long("names").takes_value(false).help(
            "Prints the name every object would be exported under.",
        ))
        .arg(Arg::with_name("stats").long("stats").takes_value(false).help(
            "Prints entity, state and object statistics, and the export manifest.",
        ))
        .arg(
            Arg::with_name("verbose")
                .long("verbose")
                .short("v")
                .takes_value(false)
                .help("Also logs warnings and progress."),
        )
        .arg(
            Arg::with_name("settings")
                .long("settings")
                .takes_value(true)
                .help("A toml file with the exporter settings (game, appid, enable_colliders)."),
        )
        .arg(
            Arg::with_name("game")
                .long("game")
                .takes_value(true)
                .help("Overrides the game of the settings."),
        )
        .arg(
            Arg::with_name("files")
                .multiple(true)
                .takes_value(true)
                .help("Scene snapshots (*.scene.toml) or directories containing them.")
                .required(true),
        )
        .get_matches();

    // Custom logging formatting: "[ERROR] Error text."
    env_logger::Builder::new()
        .format(|buf, record| writeln!(buf, "[{}] {}", record.level(), record.args()))
        .filter_level(if cli_matches.is_present("verbose") {
            log::LevelFilter::Info
        } else {
            log::LevelFilter::Error
        })
        .parse_default_env()
        .init();

    let mut settings = match cli_matches.value_of("settings") {
        Some(path) => match Settings::load(Path::new(path)) {
            Ok(settings) => settings,
            Err(e) => {
                log::error!("{:?}", e);
                std::process::exit(2);
            }
        },
        None => Settings::default(),
    };
    if let Some(game) = cli_matches.value_of("game") {
        settings.game = game.to_owned();
    }

    let mut any_errs = false;

    for path in scene_files(cli_matches.values_of("files").into_iter().flatten()) {
        let f_name = path.file_name().map(|f| f.to_string_lossy());
        if !f_name.map_or(false, |f| f.ends_with(SCENE_EXTENSION)) {
            log::error!("File path was not a scene snapshot: {}", path.display());
            any_errs = true;
            continue;
        }

        match check_scene_file(&path, &settings, &cli_matches) {
            Err(e) => {
                log::error!("Could not load scene: {}", path.display());
                log::error!("{:?}", e);
                any_errs = true;
            }
            Ok(success) => {
                any_errs |= !success;
            }
        }
    }

    if any_errs {
        std::process::exit(1);
    }
}

/// Expands directories into the scene snapshots they contain.
fn scene_files<'a>(args: impl Iterator<Item = &'a str>) -> Vec<PathBuf> {
    let mut files = vec![];
    for arg in args {
        let path = Path::new(arg);
        if path.is_dir() {
            files.extend(
                WalkDir::new(path)
                    .follow_links(true)
                    .into_iter()
                    .filter_map(|e| e.ok())
                    .filter(|e| e.file_name().to_string_lossy().ends_with(SCENE_EXTENSION))
                    .map(|e| e.into_path()),
            );
        } else {
            files.push(path.to_path_buf());
        }
    }
    files
}

/// Runs checks on the scene at the specified path.
/// Returns true if there were no errors.
fn check_scene_file(
    path: &Path,
    settings: &Settings,
    args: &clap::ArgMatches,
) -> Result<bool, anyhow::Error> {
    let mut scene = Scene::load(path)?;
    ensure_export_markers(&mut scene);

    let validator = Validator::new(&scene, settings);
    let mut errors = IndexMap::<String, Vec<String>>::new();

    errors
        .entry("Corrupt name".to_owned())
        .or_insert(vec![])
        .extend(corrupt_names::verify(&scene));

    for id in scene.ids() {
        let name = object_name(&scene, id);
        for (issue, issue_errors) in validator.categorized_errors(id) {
            errors
                .entry(issue.to_owned())
                .or_insert(vec![])
                .extend(issue_errors.into_iter().map(|e| format!("[{}] {}", name, e)));
        }

        let inherit = &scene.get(id).settings.inherit_animation;
        if inherit != NO_INHERIT && settings.inherit_choice(inherit).is_none() {
            log::warn!(
                "[{}] inherits animations from [{}], which {} does not have",
                name,
                inherit,
                settings.game
            );
        }
    }

    // Print output
    let total_errors: usize = errors.iter().map(|(_, errors)| errors.len()).sum();
    if args.is_present("summary") {
        let issues = errors
            .iter()
            .filter(|(_, errors)| !errors.is_empty())
            .map(|(issue, _)| issue)
            .join(",");
        if total_errors > 0 {
            log::error!("{},{},{}", path.display(), total_errors, issues);
        }
    } else if total_errors > 0 {
        log::error!("The scene {} has {} errors:", path.display(), total_errors);
        for (_issue, errors) in errors {
            for error in errors {
                log::error!("{}", error);
            }
        }
    }

    if args.is_present("names") {
        for (id, export_name) in plan_export_names(&validator) {
            println!("{} -> {}", object_name(&scene, id), export_name);
        }
    }

    if args.is_present("stats") {
        println!("{}", SceneStatistics::collect(&validator));
        let manifest = collect_manifest(&validator);
        for mesh in manifest.meshes.values() {
            println!("Mesh {} ({} objects)", mesh.label, mesh.objects.len());
        }
        for anim in &manifest.animations {
            let enabled = if anim.export { "" } else { " [disabled]" };
            println!("Animation {} on {}{}", anim.label, anim.armature, enabled);
        }
    }

    Ok(total_errors == 0)
}
