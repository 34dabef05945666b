mod docs;
mod utils;
