fn main() -> anyhow::Result<()> {
    prowl::cli::run()
}
