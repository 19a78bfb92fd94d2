mod grammar;
mod properties;
