mod option;
mod scalar;
