pub struct DefaultsConfig {
    pub num_smiles: usize,
    pub batch_size: usize,
    pub with_likelihood: bool,
    pub sampling_mode: String,
    pub temperature: f64,
    pub k: usize,
    pub p: f64,
    pub num_conformers: usize,
    pub torsion_noise: f64,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            num_smiles: 1024,
            batch_size: 128,
            with_likelihood: true,
            sampling_mode: "multinomial".to_string(),
            temperature: 1.0,
            k: 5,
            p: 1.0,
            num_conformers: 1,
            torsion_noise: 0.0,
        }
    }
}
