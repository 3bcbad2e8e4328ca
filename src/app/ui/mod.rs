mod controls;
mod details;
mod fps;
mod panels;

pub(in crate::app) use fps::FpsCounter;
