fn main() {
    comptoir_api::main();
}
