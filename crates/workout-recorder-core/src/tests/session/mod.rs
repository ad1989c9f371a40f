mod controller;
mod format;
