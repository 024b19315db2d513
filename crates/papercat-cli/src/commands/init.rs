//! Module for setting up a `papercat` configuration

use super::*;

#[derive(Args, Clone)]
pub struct InitOptions {
  /// Directory to scan when no directory is passed to a command
  #[arg(long)]
  pub directory:   Option<PathBuf>,
  /// Directory for the catalog tables
  #[arg(long)]
  pub catalog_dir: Option<PathBuf>,
}

/// Function for the [`Commands::Init`] in the CLI.
pub async fn init<I: UserInteraction>(
  interaction: &I,
  cli: &Cli,
  init_options: InitOptions,
) -> Result<()> {
  let InitOptions { directory, catalog_dir } = init_options;
  let config_path = cli.config_path();

  let config = if config_path.exists()
    && !interaction.confirm(&format!(
      "A configuration already exists at {}, do you want to overwrite it?",
      config_path.display()
    ))? {
    interaction.reply(ResponseContent::Info("Keeping the existing configuration"))?;
    cli.load_config()?
  } else {
    let mut config = Config::default();
    if let Some(catalog_dir) = catalog_dir {
      config = config.with_catalog_dir(&absolute(&catalog_dir));
    }
    config.save(&config_path)?;
    interaction.reply(ResponseContent::Success(&format!(
      "Configuration written to {}\nCatalog directory: {}",
      config_path.display(),
      config.catalog_dir.display(),
    )))?;
    config
  };

  if let Some(directory) = directory {
    let directory = absolute(&directory);
    if !directory.is_dir() {
      return Err(PapercatError::DirectoryNotFound(directory).into());
    }
    config.save_default_directory(&directory)?;
    interaction.reply(ResponseContent::Success(&format!(
      "Default directory set to {}",
      directory.display()
    )))?;
  }
  Ok(())
}
