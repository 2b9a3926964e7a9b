fn main() -> anyhow::Result<()> {
    greentic_assess::cli::main()
}
