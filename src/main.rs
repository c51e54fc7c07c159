fn main() -> anyhow::Result<()> {
    anvesh::run()
}
