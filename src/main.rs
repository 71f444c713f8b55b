fn main() -> std::io::Result<()> {
    contact_import_lib::run()
}
