fn main() {
    occupancy_lib::run()
}
