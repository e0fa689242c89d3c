mod application;

mod presentation {
    pub mod cli;
}

fn main() -> filrec_core::error::Result<()> {
    application::run()
}
