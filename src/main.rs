fn main() {
    crx_bin::main();
}
