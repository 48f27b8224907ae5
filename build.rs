fn main() {
    // ESP-IDF environment (linker args, sdkconfig) only exists for the
    // hardware build; host builds and tests skip it.
    #[cfg(feature = "espidf")]
    embuild::espidf::sysenv::output();
}
