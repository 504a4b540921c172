// codereel: steppable visual execution model for animated coding tutorials

use std::io;

use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use codereel::scene::config::SceneConfig;
use codereel::scene::driver::SceneDriver;
use codereel::scene::step::TraceRecorder;
use codereel::scene::{build_scene, Scene, SCENE_NAMES};
use codereel::snapshot::SnapshotRenderer;
use codereel::ui::App;

const DEFAULT_SCENE: &str = "add-token";

fn print_usage(program_name: &str) {
    eprintln!("Usage: {} [SCENE] [--dump] [--list]", program_name);
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --list    Print the available scenes and exit");
    eprintln!("  --dump    Print the scene's steps instead of opening the viewer");
    eprintln!();
    eprintln!("Examples:");
    eprintln!(
        "  {}                      # Step through '{}'",
        program_name, DEFAULT_SCENE
    );
    eprintln!(
        "  {} winner-horizontal    # Step through the horizontal check",
        program_name
    );
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command-line arguments
    let args: Vec<String> = std::env::args().collect();
    let program_name = args.first().map(|s| s.as_str()).unwrap_or("codereel");

    let mut scene_name: Option<&str> = None;
    let mut dump = false;
    for arg in args.iter().skip(1) {
        match arg.as_str() {
            "--list" => {
                for name in SCENE_NAMES {
                    println!("{}", name);
                }
                return Ok(());
            }
            "--dump" => dump = true,
            "-h" | "--help" => {
                print_usage(program_name);
                return Ok(());
            }
            flag if flag.starts_with('-') => {
                eprintln!("Error: Unknown option '{}'", flag);
                eprintln!();
                print_usage(program_name);
                std::process::exit(1);
            }
            name if scene_name.is_none() => scene_name = Some(name),
            extra => {
                eprintln!("Error: Unexpected argument '{}'", extra);
                eprintln!();
                print_usage(program_name);
                std::process::exit(1);
            }
        }
    }
    let scene_name = scene_name.unwrap_or(DEFAULT_SCENE);

    let config = SceneConfig::connect_four();
    let scene = match build_scene(scene_name, &config) {
        Ok(scene) => scene,
        Err(e) => {
            eprintln!("Error: {}", e);
            eprintln!("Available scenes: {}", SCENE_NAMES.join(", "));
            std::process::exit(1);
        }
    };

    if dump {
        return dump_scene(&scene);
    }

    // Snapshot memory limit (1 GB)
    let snapshot_limit = 1024 * 1024 * 1024;
    let mut renderer = SnapshotRenderer::new(snapshot_limit)?;

    eprintln!("Playing scene '{}'...", scene.name);
    let failure = match SceneDriver::run(&scene, &mut renderer) {
        Ok(driver) => {
            eprintln!("Scene completed successfully.");
            eprintln!("Total steps: {}", driver.steps_executed());
            None
        }
        Err(e) => {
            eprintln!("Trace error: {}", e);
            match e.step() {
                Some(step) => eprintln!("Entering TUI with the {} step(s) before the failure...", step),
                None => eprintln!("Entering TUI with partial history..."),
            }
            Some(e.to_string())
        }
    };

    // Set up terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Create and run app
    let mut app = App::new(
        &scene.name,
        scene.source.lines().to_vec(),
        renderer.into_history(),
        failure,
    );
    let res = app.run(&mut terminal);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("Error: {:?}", err);
    }

    Ok(())
}

/// Print the listing followed by every step and its descriptors
fn dump_scene(scene: &Scene) -> Result<(), Box<dyn std::error::Error>> {
    for (i, line) in scene.source.lines().iter().enumerate() {
        println!("{:>3} | {}", i + 1, line);
    }
    println!();

    let mut recorder = TraceRecorder::new();
    let result = SceneDriver::run(scene, &mut recorder);

    for step in &recorder.steps {
        match step.location {
            Some(location) => println!("{:>4}  {}  @ {}", step.index, step.intent, location),
            None => println!("{:>4}  {}", step.index, step.intent),
        }
        for descriptor in &step.descriptors {
            println!("        - {}", descriptor);
        }
    }

    let driver = result?;
    println!();
    println!("return register: {}", driver.return_value());
    Ok(())
}
