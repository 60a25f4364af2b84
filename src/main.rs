//! raised-beds - raised garden bed variants for a farming host
//!
//! Command line front end: headless season runs, definition checks and
//! craftables atlas patching.

mod config;
mod content_packs;
mod headless;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use raised_beds_assets::{decode_spritesheet, ContentInjector, InjectionLimits};
use tracing::info;

#[derive(Parser, Debug)]
#[command(author, version, about = "Raised garden beds toolkit", long_about = None)]
struct Cli {
    /// Player toggles (TOML)
    #[arg(long, default_value = config::DEFAULT_CONFIG_PATH, global = true)]
    config: PathBuf,

    /// Base variant definitions (JSON)
    #[arg(long, default_value = config::DEFAULT_DEFINITIONS_PATH, global = true)]
    definitions: PathBuf,

    /// Base translations (JSON)
    #[arg(long, default_value = config::DEFAULT_TRANSLATIONS_PATH, global = true)]
    translations: PathBuf,

    /// Directory scanned for content packs
    #[arg(long, default_value = config::DEFAULT_CONTENT_PACKS_DIR, global = true)]
    packs: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run a headless farm for a number of days and print a summary
    Simulate {
        #[arg(long, default_value_t = 112)]
        days: u32,
        #[arg(long, default_value_t = 0)]
        seed: u64,
        #[arg(long, default_value_t = 24)]
        beds: u32,
        #[arg(long, default_value_t = 0.2)]
        rain_chance: f64,
        #[arg(long, default_value_t = 0.5)]
        repair_chance: f64,
    },
    /// Load every definition strictly and list the variants
    Check,
    /// Copy variant sprites into a craftables atlas
    PatchAtlas {
        /// Craftables atlas to patch (PNG)
        #[arg(long)]
        atlas: PathBuf,
        /// Combined garden bed spritesheet (PNG)
        #[arg(long)]
        sprites: PathBuf,
        /// Output image path
        #[arg(long, default_value = "craftables.png")]
        output: PathBuf,
        /// Big craftable id allocated to the generic garden bed
        #[arg(long)]
        base_id: i32,
        /// Extra ids reserved after the base id
        #[arg(long, default_value_t = 50)]
        reserved_slots: usize,
    },
    /// Write the default player toggles to the config path
    InitConfig,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();
    info!("Starting raised-beds v{}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Command::Simulate {
            days,
            seed,
            beds,
            rain_chance,
            repair_chance,
        } => {
            let garden = config::load_garden_config(&cli.config);
            let registry = config::load_variant_registry(&cli.definitions, &cli.packs)?;
            let translations = config::load_translations(&cli.translations, &cli.packs);
            let options = headless::SimulationOptions {
                days,
                seed,
                beds,
                rain_chance,
                repair_chance,
            };
            let summary = headless::run(&options, &registry, &translations, &garden)?;
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        Command::Check => {
            let registry = config::load_variant_registry_strict(&cli.definitions, &cli.packs)?;
            let translations = config::load_translations(&cli.translations, &cli.packs);
            for (index, def) in registry.iter().enumerate() {
                println!(
                    "{index:>3}  {:<24} sprite {:>2}  soil {}  breaks after {} days  {}",
                    def.key,
                    def.sprite_index,
                    def.soil_height_above_ground,
                    def.days_to_break,
                    registry.display_name(&def.key, &translations)?,
                );
            }
            let unresolvable = registry.unresolvable_keys(0);
            anyhow::ensure!(
                unresolvable.is_empty(),
                "variants don't resolve back from their names or ids: {}",
                unresolvable.join(", ")
            );
            println!("{} variants OK", registry.len());
            for pack in content_packs::discover_lenient(&cli.packs) {
                println!(
                    "pack {} ({}) by {}, priority {}",
                    pack.id,
                    pack.manifest.name.as_deref().unwrap_or(&pack.id),
                    pack.manifest.author.as_deref().unwrap_or("unknown"),
                    pack.manifest.priority,
                );
            }
        }
        Command::PatchAtlas {
            atlas,
            sprites,
            output,
            base_id,
            reserved_slots,
        } => {
            let garden = config::load_garden_config(&cli.config);
            let registry = config::load_variant_registry(&cli.definitions, &cli.packs)?;
            let translations = config::load_translations(&cli.translations, &cli.packs);
            let mut atlas_image = image::open(&atlas)
                .with_context(|| format!("Failed to open {}", atlas.display()))?
                .to_rgba8();
            let sprite_bytes = std::fs::read(&sprites)
                .with_context(|| format!("Failed to read {}", sprites.display()))?;
            let sprite_sheet = decode_spritesheet(&sprite_bytes)?;
            let limits = InjectionLimits {
                reserved_slots,
                sprite_sheet_height: sprite_sheet.height(),
            };
            let injector = ContentInjector::new(&registry, &translations, &garden, limits);
            let patched = injector.patch_atlas(&mut atlas_image, &sprite_sheet, base_id)?;
            atlas_image
                .save(&output)
                .with_context(|| format!("Failed to write {}", output.display()))?;
            println!("Patched {patched} variants into {}", output.display());
        }
        Command::InitConfig => {
            config::save_garden_config(&Default::default(), &cli.config)?;
            println!("Wrote {}", cli.config.display());
        }
    }

    Ok(())
}
