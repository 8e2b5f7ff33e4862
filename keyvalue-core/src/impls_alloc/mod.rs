mod string;
mod vec;
