mod remote;
mod support;
