extern crate error_chain;
extern crate sojobo;

use std::process::exit;

use error_chain::ChainedError;

use sojobo::run;


fn main() {
    let result = run();
    if let Err(error) = result {
        println!("{}", error.display_chain());
        exit(1);
    }
}
