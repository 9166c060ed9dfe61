use signwright::{configurator, settings::Settings};

fn main() -> anyhow::Result<()> {
    configurator::run(Settings::from_env())
}
