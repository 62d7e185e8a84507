mod helpers;
mod measurements;
