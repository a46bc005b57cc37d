fn main() -> anyhow::Result<()> {
    linkfolio::run()
}
