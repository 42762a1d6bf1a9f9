fn main() -> anyhow::Result<()> {
    lineview::init();
    lineview::cli::run()
}
