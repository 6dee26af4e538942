pub mod errors;
pub mod db;
pub mod spaceship;

#[cfg(test)]
mod tests;
