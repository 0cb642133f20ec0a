fn main() {
    rjar::cli::run();
}
