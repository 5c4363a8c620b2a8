fn main() {
    tiny_dwarf::game::run();
}
