fn main() {
    bastos::term::main();
}
