use fastfs_kit::{BulkReadOptions, FastFS};

fn main() {
    let workdir = std::env::temp_dir().join("fastfs_hello");
    std::fs::create_dir_all(&workdir).unwrap();
    println!("Working dir: {}", workdir.display());

    // the `.fastfs` configuration file and every relative path live under `workdir`
    let mut fs = FastFS::with_workdir(&workdir).unwrap();

    // creates `<workdir>/files` and writes `<workdir>/.fastfs`;
    // from now on relative paths are redirected into `files`
    fs.initialize("files", true).unwrap();

    // lands in `<workdir>/files/greeting.txt`
    fs.write_file("greeting.txt", "Hello").unwrap();
    assert!(fs.exists("greeting.txt").unwrap());
    println!("greeting.txt is stored at {}", fs.to_host("greeting.txt").unwrap().display());

    // lines are appended to the same redirected file
    fs.write_lines("log.txt", &["first"]).unwrap();
    fs.append_lines("log.txt", &["second"]).unwrap();
    for line in fs.iter_lines("log.txt").unwrap() {
        println!("log: {}", line.unwrap());
    }

    // one JSON file per value: `runs/0.json`, `runs/1.json`, `runs/2.json`
    fs.bulk_write("runs", &["alpha", "beta", "gamma"], "json", None)
        .unwrap();
    let runs: Vec<String> = fs
        .bulk_read("runs", BulkReadOptions::new())
        .unwrap()
        .into_values();
    assert_eq!(runs, ["alpha", "beta", "gamma"]);

    println!("{}, {}!", fs.read_file("greeting.txt").unwrap(), runs.join(" "));

    // removes everything the demo created
    fs.delete_directory("runs").unwrap();
    std::fs::remove_dir_all(&workdir).unwrap();
}
