//! Integration tests for rg-output.

#[cfg(test)]
mod csv_tests {
    use tempfile::TempDir;

    use crate::csv::{CsvWriter, STEPS_FILE, SUMMARIES_FILE};
    use crate::row::{MoverStepRow, TickSummaryRow};
    use crate::writer::OutputWriter;

    fn tmp() -> TempDir {
        tempfile::tempdir().expect("create temp dir")
    }

    fn step_row(object: u32, tick: u64) -> MoverStepRow {
        MoverStepRow { tick, object, from_x: 1, from_y: 2, to_x: 2, to_y: 3 }
    }

    fn summary_row(tick: u64) -> TickSummaryRow {
        TickSummaryRow {
            tick,
            game_millis:   tick * 1_000 / 15,
            planned:       2,
            moved:         3,
            arrived:       1,
            path_failures: 0,
            step_blocked:  0,
            gave_up:       0,
            busy:          4,
        }
    }

    #[test]
    fn csv_files_created() {
        let dir = tmp();
        let _w = CsvWriter::new(dir.path()).unwrap();
        assert!(dir.path().join(STEPS_FILE).exists());
        assert!(dir.path().join(SUMMARIES_FILE).exists());
    }

    #[test]
    fn missing_directory_is_created() {
        let dir = tmp();
        let nested = dir.path().join("runs").join("first");
        let _w = CsvWriter::new(&nested).unwrap();
        assert!(nested.join(STEPS_FILE).exists());
    }

    #[test]
    fn csv_headers_correct() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.finish().unwrap();

        let mut rdr = csv::Reader::from_path(dir.path().join(STEPS_FILE)).unwrap();
        let headers: Vec<_> = rdr.headers().unwrap().iter().map(str::to_owned).collect();
        assert_eq!(headers, ["tick", "object", "from_x", "from_y", "to_x", "to_y"]);

        let mut rdr2 = csv::Reader::from_path(dir.path().join(SUMMARIES_FILE)).unwrap();
        let headers2: Vec<_> = rdr2.headers().unwrap().iter().map(str::to_owned).collect();
        assert_eq!(headers2[0], "tick");
        assert_eq!(headers2.len(), 9);
    }

    #[test]
    fn steps_written_in_order() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.write_steps(&[step_row(0, 5), step_row(3, 5), step_row(1, 6)]).unwrap();
        w.finish().unwrap();

        let mut rdr = csv::Reader::from_path(dir.path().join(STEPS_FILE)).unwrap();
        let rows: Vec<_> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 3);
        assert_eq!(&rows[0][1], "0");
        assert_eq!(&rows[1][1], "3");
        assert_eq!(&rows[2][0], "6");
        assert_eq!(&rows[2][5], "3");
    }

    #[test]
    fn tick_summary_written() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.write_tick_summary(&summary_row(30)).unwrap();
        w.finish().unwrap();

        let mut rdr = csv::Reader::from_path(dir.path().join(SUMMARIES_FILE)).unwrap();
        let rows: Vec<_> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 1);
        assert_eq!(&rows[0][0], "30");
        assert_eq!(&rows[0][1], "2000");   // 30 ticks at 15/s
        assert_eq!(&rows[0][8], "4");      // busy
    }

    #[test]
    fn csv_finish_idempotent() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.finish().unwrap();
        w.finish().unwrap();
    }
}

// ── Observer ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod observer_tests {
    use rg_core::{CellCoord, HouseId, SimConfig};
    use rg_grid::{Grid, ObjectKind, World};
    use rg_path::EdgeFollower;
    use rg_sim::SimBuilder;

    use crate::csv::{CsvWriter, STEPS_FILE, SUMMARIES_FILE};
    use crate::row::{MoverStepRow, TickSummaryRow};
    use crate::writer::OutputWriter;
    use crate::{OutputError, OutputResult, TraceObserver};

    /// Collects rows in memory.
    #[derive(Default)]
    struct Memory {
        steps:     Vec<MoverStepRow>,
        summaries: Vec<TickSummaryRow>,
        finished:  usize,
    }

    impl OutputWriter for Memory {
        fn write_steps(&mut self, rows: &[MoverStepRow]) -> OutputResult<()> {
            self.steps.extend_from_slice(rows);
            Ok(())
        }
        fn write_tick_summary(&mut self, row: &TickSummaryRow) -> OutputResult<()> {
            self.summaries.push(*row);
            Ok(())
        }
        fn finish(&mut self) -> OutputResult<()> {
            self.finished += 1;
            Ok(())
        }
    }

    /// Fails every write.
    struct Broken;

    impl OutputWriter for Broken {
        fn write_steps(&mut self, _rows: &[MoverStepRow]) -> OutputResult<()> {
            Err(OutputError::Io(std::io::Error::other("steps")))
        }
        fn write_tick_summary(&mut self, _row: &TickSummaryRow) -> OutputResult<()> {
            Err(OutputError::Io(std::io::Error::other("summary")))
        }
        fn finish(&mut self) -> OutputResult<()> {
            Ok(())
        }
    }

    fn diagonal_sim(ticks: u64) -> rg_sim::Sim<EdgeFollower> {
        let mut world = World::new(Grid::new(6, 6).unwrap());
        let at = |x, y| world.grid.cell_id(CellCoord::new(x, y)).unwrap();
        let (start, dest) = (at(0, 0), at(5, 5));
        let tank = world.spawn(ObjectKind::Vehicle, HouseId(0), start).unwrap();
        let config = SimConfig { total_ticks: ticks, ..SimConfig::default() };
        SimBuilder::new(config, world, EdgeFollower::default())
            .orders(vec![(tank, dest)])
            .build()
            .unwrap()
    }

    #[test]
    fn every_step_and_tick_is_traced() {
        let mut sim = diagonal_sim(8);
        let mut obs = TraceObserver::new(Memory::default(), &sim.config);
        sim.run(&mut obs).unwrap();
        assert!(obs.take_error().is_none());

        let mem = obs.into_writer();
        assert_eq!(mem.summaries.len(), 8);
        assert_eq!(mem.finished, 1);
        assert_eq!(mem.steps.len(), 5);
        for (i, step) in mem.steps.iter().enumerate() {
            let i = i as i32;
            assert_eq!(step.tick, i as u64);
            assert_eq!((step.from_x, step.from_y), (i, i));
            assert_eq!((step.to_x, step.to_y), (i + 1, i + 1));
        }
        assert_eq!(mem.summaries[4].arrived, 1);
        assert_eq!(mem.summaries[5].moved, 0);
    }

    #[test]
    fn first_error_is_kept() {
        let mut sim = diagonal_sim(3);
        let mut obs = TraceObserver::new(Broken, &sim.config);
        sim.run(&mut obs).unwrap();
        let err = obs.take_error().unwrap();
        assert_eq!(err.to_string(), "I/O error: steps");
        assert!(obs.take_error().is_none());
    }

    #[test]
    fn integration_csv() {
        let dir = tempfile::tempdir().unwrap();
        let mut sim = diagonal_sim(6);
        let writer = CsvWriter::new(dir.path()).unwrap();
        let mut obs = TraceObserver::new(writer, &sim.config);
        sim.run(&mut obs).unwrap();
        assert!(obs.take_error().is_none());

        let steps = csv::Reader::from_path(dir.path().join(STEPS_FILE)).unwrap().records().count();
        let ticks = csv::Reader::from_path(dir.path().join(SUMMARIES_FILE)).unwrap().records().count();
        assert_eq!(steps, 5);
        assert_eq!(ticks, 6);
    }
}
