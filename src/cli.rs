//! Command-line front end: argument parsing and command dispatch.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::appearance::{AppearanceEdit, AppearanceEditor};
use crate::avatar::{AvatarTransform, CropRect, Rotation};
use crate::config::AppConfig;
use crate::error::{AppError, AppResult};
use crate::platform::detect_platform_from_url;
use crate::profile::{load_profile, Profile};
use crate::render::{RenderModel, RenderSurface};
use crate::seo::SeoMetadata;
use crate::storage::{AppearanceStore, JsonFileStore};
use crate::vcard::{render_vcard, vcard_file_name};

#[derive(Debug, Parser)]
#[command(
    name = "linkfolio",
    about = "Appearance and export tools for link-in-bio profiles",
    version,
    after_help = "Set LINKFOLIO_LOG to tracing filter directives (default: info)."
)]
pub struct Cli {
    /// Treat the host theme as dark, overriding `prefer_dark` from config.json.
    #[arg(long, global = true, conflicts_with = "light")]
    pub dark: bool,

    /// Treat the host theme as light, overriding `prefer_dark` from config.json.
    #[arg(long, global = true)]
    pub light: bool,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Dark-mode hint from the command line, if one was given.
    pub fn dark_hint(&self) -> Option<bool> {
        match (self.dark, self.light) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Print the resolved colors as JSON.
    Resolve(ProfileArgs),

    /// Print the profile stylesheet.
    Css(ProfileArgs),

    /// Print the render model for one surface as JSON.
    Render(RenderArgs),

    /// Print (or write) the vCard.
    Vcard(VcardArgs),

    /// Print the head tags, or inject them into an HTML template.
    Seo(SeoArgs),

    /// Print the platform detected for a URL.
    Detect(DetectArgs),

    /// Rotate, crop and downscale an avatar to PNG.
    Avatar(AvatarArgs),

    /// Apply a theme preset to stored appearance settings.
    Theme(ThemeArgs),
}

impl Commands {
    /// Only `theme` touches persisted appearance settings.
    pub fn uses_store(&self) -> bool {
        matches!(self, Commands::Theme(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum SurfaceArg {
    Editor,
    Mobile,
    #[default]
    Public,
}

impl From<SurfaceArg> for RenderSurface {
    fn from(surface: SurfaceArg) -> Self {
        match surface {
            SurfaceArg::Editor => RenderSurface::EditorPreview,
            SurfaceArg::Mobile => RenderSurface::MobilePreview,
            SurfaceArg::Public => RenderSurface::PublicPage,
        }
    }
}

#[derive(Debug, Clone, Args)]
pub struct ProfileArgs {
    /// Profile JSON document.
    #[arg(value_name = "PROFILE")]
    pub profile: PathBuf,
}

#[derive(Debug, Clone, Args)]
pub struct RenderArgs {
    #[arg(value_name = "PROFILE")]
    pub profile: PathBuf,

    #[arg(long, value_enum, default_value_t = SurfaceArg::Public)]
    pub surface: SurfaceArg,
}

#[derive(Debug, Clone, Args)]
pub struct VcardArgs {
    #[arg(value_name = "PROFILE")]
    pub profile: PathBuf,

    /// Write the card to this file instead of stdout.
    #[arg(long)]
    pub out: Option<PathBuf>,
}

#[derive(Debug, Clone, Args)]
pub struct SeoArgs {
    #[arg(value_name = "PROFILE")]
    pub profile: PathBuf,

    /// HTML page to inject the tags into.
    #[arg(long)]
    pub template: Option<PathBuf>,

    #[arg(long)]
    pub out: Option<PathBuf>,
}

#[derive(Debug, Clone, Args)]
pub struct DetectArgs {
    pub url: String,
}

#[derive(Debug, Clone, Args)]
pub struct AvatarArgs {
    pub input: PathBuf,

    pub output: PathBuf,

    /// Rotation in degrees, snapped to the nearest quarter turn.
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    pub rotate: i32,

    /// Center-crop to a square after rotating.
    #[arg(long)]
    pub square: bool,
}

#[derive(Debug, Clone, Args)]
pub struct ThemeArgs {
    #[arg(value_name = "PROFILE_ID")]
    pub profile_id: String,

    #[arg(value_name = "THEME_ID")]
    pub theme_id: String,
}

fn read_file(path: &Path) -> AppResult<Vec<u8>> {
    fs::read(path).map_err(|source| AppError::Read {
        path: path.to_path_buf(),
        source,
    })
}

fn write_file(path: &Path, contents: &[u8]) -> AppResult<()> {
    fs::write(path, contents).map_err(|source| AppError::Write {
        path: path.to_path_buf(),
        source,
    })
}

fn emit(out: &mut dyn Write, target: Option<&Path>, contents: &str) -> AppResult<()> {
    match target {
        Some(path) => {
            write_file(path, contents.as_bytes())?;
            tracing::info!(path = %path.display(), bytes = contents.len(), "wrote output");
        }
        None => out.write_all(contents.as_bytes())?,
    }
    Ok(())
}

fn build_model(path: &Path, surface: RenderSurface, dark: bool) -> AppResult<RenderModel> {
    let profile: Profile = load_profile(path)?;
    Ok(RenderModel::build(surface, &profile, dark))
}

/// Run one parsed command line, writing command output to `out`.
pub fn execute(
    cli: &Cli,
    config: &AppConfig,
    store: &dyn AppearanceStore,
    out: &mut dyn Write,
) -> AppResult<()> {
    let dark = cli.dark_hint().unwrap_or(config.prefer_dark);
    match &cli.command {
        Commands::Resolve(args) => {
            let model = build_model(&args.profile, RenderSurface::PublicPage, dark)?;
            writeln!(out, "{}", serde_json::to_string_pretty(&model.colors)?)?;
        }
        Commands::Css(args) => {
            let model = build_model(&args.profile, RenderSurface::PublicPage, dark)?;
            out.write_all(model.stylesheet.as_bytes())?;
        }
        Commands::Render(args) => {
            let model = build_model(&args.profile, args.surface.into(), dark)?;
            writeln!(out, "{}", serde_json::to_string_pretty(&model)?)?;
        }
        Commands::Vcard(args) => {
            let profile = load_profile(&args.profile)?;
            let seo = SeoMetadata::for_profile(&profile, &config.site_url);
            let card = render_vcard(&profile, Some(&seo.canonical_url));
            tracing::debug!(file_name = %vcard_file_name(&profile), "rendered vcard");
            emit(out, args.out.as_deref(), &card)?;
        }
        Commands::Seo(args) => {
            let profile = load_profile(&args.profile)?;
            let seo = SeoMetadata::for_profile(&profile, &config.site_url);
            let rendered = match &args.template {
                Some(template) => {
                    let html = String::from_utf8_lossy(&read_file(template)?).into_owned();
                    seo.inject_into(&html)
                }
                None => format!("{}\n", seo.render_tags()),
            };
            emit(out, args.out.as_deref(), &rendered)?;
        }
        Commands::Detect(args) => match detect_platform_from_url(&args.url) {
            Some(platform) => writeln!(out, "{}", serde_json::to_string_pretty(platform)?)?,
            None => writeln!(out, "null")?,
        },
        Commands::Avatar(args) => {
            let encoded = read_file(&args.input)?;
            let rotation = Rotation::from_degrees(args.rotate);
            let crop = if args.square {
                let (width, height) = rotated_dimensions(&encoded, rotation)?;
                Some(CropRect::centered_square(width, height))
            } else {
                None
            };
            let transform = AvatarTransform {
                rotation,
                crop,
                max_size: config.avatar_max_size,
            };
            let png = transform.apply_to_bytes(&encoded)?;
            write_file(&args.output, &png)?;
            tracing::info!(path = %args.output.display(), bytes = png.len(), "wrote avatar");
        }
        Commands::Theme(args) => {
            let mut editor = AppearanceEditor::load(args.profile_id.as_str(), store)?;
            let changed = editor
                .apply_and_save(AppearanceEdit::ApplyTheme(args.theme_id.clone()), store)?;
            if !changed && editor.settings().theme_id != args.theme_id {
                return Err(AppError::usage(format!("unknown theme: {}", args.theme_id)));
            }
            writeln!(
                out,
                "{}",
                serde_json::to_string_pretty(editor.settings())?
            )?;
        }
    }
    Ok(())
}

fn rotated_dimensions(encoded: &[u8], rotation: Rotation) -> AppResult<(u32, u32)> {
    let decoded = image::load_from_memory(encoded).map_err(crate::avatar::AvatarError::from)?;
    let (width, height) = (decoded.width(), decoded.height());
    Ok(match rotation {
        Rotation::Cw90 | Rotation::Cw270 => (height, width),
        Rotation::None | Rotation::Cw180 => (width, height),
    })
}

/// Store used by the `theme` command.
pub fn default_store() -> AppResult<JsonFileStore> {
    Ok(JsonFileStore::with_default_dir()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use clap::CommandFactory;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("linkfolio").chain(args.iter().copied())).unwrap()
    }

    fn cli(command: Commands) -> Cli {
        Cli {
            dark: false,
            light: false,
            command,
        }
    }

    fn fixture_root() -> PathBuf {
        let mut path = std::env::temp_dir();
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::SystemTime::UNIX_EPOCH)
            .map_or(0, |d| d.as_nanos());
        let pid = std::process::id();
        path.push(format!("linkfolio-cli-{pid}-{nanos}"));
        fs::create_dir_all(&path).unwrap();
        path
    }

    fn write_profile(root: &Path) -> PathBuf {
        let path = root.join("alice.json");
        fs::write(
            &path,
            r##"{
                "username": "alice",
                "displayName": "Alice",
                "links": [{ "title": "Code", "url": "https://github.com/alice" }],
                "appearance": { "wallpaper": "#0F172A" }
            }"##,
        )
        .unwrap();
        path
    }

    fn run_to_string(cli: &Cli, config: &AppConfig) -> String {
        let store = MemoryStore::default();
        let mut out = Vec::new();
        execute(cli, config, &store, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn command_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_command_and_options() {
        let parsed = parse(&["render", "p.json", "--dark", "--surface", "mobile"]);
        assert_eq!(parsed.dark_hint(), Some(true));
        match parsed.command {
            Commands::Render(args) => {
                assert_eq!(args.profile, PathBuf::from("p.json"));
                assert_eq!(args.surface, SurfaceArg::Mobile);
            }
            other => panic!("unexpected command: {other:?}"),
        }

        let avatar = parse(&["--light", "avatar", "in.jpg", "out.png", "--rotate", "-90", "--square"]);
        assert_eq!(avatar.dark_hint(), Some(false));
        match avatar.command {
            Commands::Avatar(args) => {
                assert_eq!(args.rotate, -90);
                assert!(args.square);
            }
            other => panic!("unexpected command: {other:?}"),
        }

        let plain = parse(&["css", "p.json"]);
        assert_eq!(plain.dark_hint(), None);
        assert!(!plain.command.uses_store());
        assert!(parse(&["theme", "alice", "midnight"]).command.uses_store());
    }

    #[test]
    fn rejects_bad_command_lines() {
        let bad_lines: [&[&str]; 8] = [
            &[],
            &["frobnicate"],
            &["css"],
            &["detect", "a", "b"],
            &["render", "p.json", "--surface", "tv"],
            &["css", "p.json", "--bogus"],
            &["avatar", "a", "b", "--rotate", "left"],
            &["css", "p.json", "--dark", "--light"],
        ];
        for bad in bad_lines {
            let args = std::iter::once("linkfolio").chain(bad.iter().copied());
            assert!(Cli::try_parse_from(args).is_err(), "{bad:?}");
        }
    }

    #[test]
    fn help_lists_every_command() {
        let help = Cli::command().render_long_help().to_string();
        for command in ["resolve", "css", "render", "vcard", "seo", "detect", "avatar", "theme"] {
            assert!(help.contains(command), "missing {command}");
        }
        assert!(help.contains("LINKFOLIO_LOG"));
    }

    #[test]
    fn detect_prints_platform_or_null() {
        let config = AppConfig::default();
        let found = run_to_string(
            &cli(Commands::Detect(DetectArgs {
                url: "https://github.com/alice".to_string(),
            })),
            &config,
        );
        assert!(found.contains("\"name\": \"GitHub\""));
        let missing = run_to_string(
            &cli(Commands::Detect(DetectArgs {
                url: "https://example.org".to_string(),
            })),
            &config,
        );
        assert_eq!(missing, "null\n");
    }

    #[test]
    fn resolve_uses_profile_and_dark_hint() {
        let root = fixture_root();
        let profile = write_profile(&root);
        let output = run_to_string(
            &cli(Commands::Resolve(ProfileArgs { profile })),
            &AppConfig::default(),
        );
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["baseColor"], "#0F172A");
        assert_eq!(value["isDarkBackground"], true);
        let _ = fs::remove_dir_all(&root);
    }

    #[test]
    fn render_uses_requested_surface() {
        let root = fixture_root();
        let profile = write_profile(&root);
        let output = run_to_string(
            &cli(Commands::Render(RenderArgs {
                profile,
                surface: SurfaceArg::Editor,
            })),
            &AppConfig::default(),
        );
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["surface"], "editor-preview");
        let _ = fs::remove_dir_all(&root);
    }

    #[test]
    fn vcard_and_seo_use_configured_site_url() {
        let root = fixture_root();
        let profile = write_profile(&root);
        let config = AppConfig {
            site_url: "https://bio.example".to_string(),
            ..AppConfig::default()
        };

        let card = run_to_string(
            &cli(Commands::Vcard(VcardArgs {
                profile: profile.clone(),
                out: None,
            })),
            &config,
        );
        assert!(card.contains("URL:https://bio.example/alice\r\n"));

        let template = root.join("page.html");
        fs::write(&template, "<html><head><title>x</title></head><body></body></html>").unwrap();
        let out_path = root.join("out.html");
        let seo = cli(Commands::Seo(SeoArgs {
            profile,
            template: Some(template),
            out: Some(out_path.clone()),
        }));
        assert_eq!(run_to_string(&seo, &config), "");
        let page = fs::read_to_string(&out_path).unwrap();
        assert!(page.contains("<link rel=\"canonical\" href=\"https://bio.example/alice\">"));
        let _ = fs::remove_dir_all(&root);
    }

    #[test]
    fn theme_command_persists_preset() {
        let store = MemoryStore::default();
        let theme = |theme_id: &str| {
            cli(Commands::Theme(ThemeArgs {
                profile_id: "alice".to_string(),
                theme_id: theme_id.to_string(),
            }))
        };
        let mut out = Vec::new();
        execute(&theme("midnight"), &AppConfig::default(), &store, &mut out).unwrap();
        let saved = store.load("alice").unwrap().unwrap();
        assert_eq!(saved.theme_id, "midnight");
        assert_eq!(store.save_count(), 1);

        let err = execute(&theme("nope"), &AppConfig::default(), &store, &mut Vec::new())
            .unwrap_err();
        assert!(matches!(err, AppError::Usage(_)));
    }

    #[test]
    fn avatar_command_writes_square_png() {
        let root = fixture_root();
        let input = root.join("in.png");
        image::RgbaImage::from_pixel(40, 20, image::Rgba([10, 20, 30, 255]))
            .save(&input)
            .unwrap();
        let output = root.join("out.png");
        let avatar = cli(Commands::Avatar(AvatarArgs {
            input,
            output: output.clone(),
            rotate: 90,
            square: true,
        }));
        run_to_string(&avatar, &AppConfig::default());
        let written = image::open(&output).unwrap();
        assert_eq!((written.width(), written.height()), (20, 20));
        let _ = fs::remove_dir_all(&root);
    }
}
