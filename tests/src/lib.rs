#![cfg(test)]

mod discovery;
mod mocks;
