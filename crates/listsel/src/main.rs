fn main() -> anyhow::Result<()> {
    listsel::cli::run()
}
