use DefectKin::Examples::network_examples::network_examples;
use DefectKin::Utils::logger::init_logger;
use simplelog::LevelFilter;

pub fn main() {
    if let Err(e) = init_logger(LevelFilter::Info, None) {
        println!("{}", e);
    }
    // 0: fluxes with He and V moments, 1: zeroth order fast path
    let task: usize = 0;
    network_examples(task);
}
