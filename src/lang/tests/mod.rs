use super::*;

mod line_test;
