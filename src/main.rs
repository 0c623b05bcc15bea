use std::{env, error::Error, process};

use stage::{gfx::HeadlessRenderer, launch, scene::SceneBuilder, ConfigParams, WindowParams};

use log;
use log4rs;

fn main() {
    if let Err(e) = init_log(log::LevelFilter::Debug, "stagehand.log") {
        eprintln!("Failed to initialise logging: {}", e);
    }

    let params = match parse_args(env::args().skip(1)) {
        Ok(params) => params,
        Err(e) => {
            log::error!("{}", e);
            process::exit(2);
        }
    };

    if let Err(e) = launch::<HeadlessRenderer>(params) {
        log::error!("Launch failed: {}", e);
        process::exit(1);
    }
}

fn parse_args<I: Iterator<Item = String>>(mut args: I) -> Result<ConfigParams, Box<dyn Error>> {
    let mut config_file = None;
    let mut fullscreen = false;
    let mut fixed_size = false;
    let mut minimal = false;
    let mut seed = None;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" => config_file = Some(args.next().ok_or("--config needs a file")?),
            "--fullscreen" => fullscreen = true,
            "--fixed-size" => fixed_size = true,
            "--minimal" => minimal = true,
            "--seed" => seed = Some(args.next().ok_or("--seed needs a number")?.parse::<u64>()?),
            other => log::warn!("Ignoring unknown argument {}", other),
        }
    }

    let mut params = match config_file {
        Some(path) => {
            log::info!("Loading config from {}", path);
            ConfigParams::from_file(path)?
        }
        None => ConfigParams {
            window: WindowParams {
                width: 1440,
                height: 810,
                title: "Stagehand".into(),
                ..Default::default()
            },
            scene: SceneBuilder::showcase(),
            ..Default::default()
        },
    };
    if minimal {
        params.scene = SceneBuilder::minimal();
    }
    if fullscreen {
        params.window.fullscreen = true;
    }
    if fixed_size {
        params.window.resizeable = false;
    }
    if seed.is_some() {
        params.scene.seed = seed;
    }
    Ok(params)
}

fn init_log(level: log::LevelFilter, log_file_name: &str) -> Result<(), Box<dyn Error>> {
    use log4rs::{
        append::{console, file},
        config,
        encode::pattern,
        init_config,
    };

    let stdout = console::ConsoleAppender::builder()
        .encoder(Box::new(pattern::PatternEncoder::new(
            "[Console] {d} - {l} - {t} - {m}{n}",
        )))
        .build();

    let file = file::FileAppender::builder()
        .encoder(Box::new(pattern::PatternEncoder::new(
            "[File] {d} - {l} - {t} - {m}{n}",
        )))
        .append(false)
        .build(log_file_name)?;

    let config = config::Config::builder()
        .appender(config::Appender::builder().build("stdout", Box::new(stdout)))
        .appender(config::Appender::builder().build("file", Box::new(file)))
        .build(
            config::Root::builder()
                .appender("stdout")
                .appender("file")
                .build(level),
        )?;

    init_config(config)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> impl Iterator<Item = String> {
        list.iter().map(|s| s.to_string()).collect::<Vec<_>>().into_iter()
    }

    #[test]
    fn no_arguments_shows_the_showcase() {
        let params = parse_args(args(&[])).unwrap();
        assert_eq!(params.scene, SceneBuilder::showcase());
        assert!(params.window.resizeable);
        assert!(!params.window.fullscreen);
    }

    #[test]
    fn flags_override_defaults() {
        let params =
            parse_args(args(&["--minimal", "--fullscreen", "--fixed-size", "--seed", "7"])).unwrap();
        assert_eq!(params.scene.content.len(), 1);
        assert_eq!(params.scene.seed, Some(7));
        assert!(params.window.fullscreen);
        assert!(!params.window.resizeable);
    }

    #[test]
    fn missing_values_are_errors() {
        assert!(parse_args(args(&["--config"])).is_err());
        assert!(parse_args(args(&["--seed", "many"])).is_err());
        assert!(parse_args(args(&["--config", "/nonexistent/stagehand.json"])).is_err());
    }
}
