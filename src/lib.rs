pub mod jscore {
    pub mod chord;
    pub mod interval;
    pub mod note;
    pub mod noteparser;
    pub mod transform;
    pub mod util;
}
