/*!

This is the long-form manual for `survey_cleaning` and `surveyclean`.

## Cleaning rules

All the rules only look at the columns that are processed (see `excludeColumns`
below). They can be combined freely: a row flagged by several rules is removed once.

### Straight-line responses

All the answers of the respondent are identical (standard deviation of 0).
Missing answers are ignored, and at least two answers are required.

### Missing values

At least one answer is missing. An empty cell, `NA`, `NaN` and `null` are all
considered missing.

### Out-of-range values

At least one answer is above the number of points of the scale, or below 1.

### Step pattern

The answers climb or descend the scale one step at a time, like a staircase:

```text
1,2,3,4,5,6,7,1,2,3     ascending, starting over after the top of the scale
7,6,5,4,3,2,1,7,6,5     descending, starting over after the bottom of the scale
1,2,3,4,5,4,3,2,1,2     mountains and valleys
```

Every pair of consecutive answers must be one step apart (with the wrap-around at
the ends of the scale). The direction may change any number of times. Straight
lines are not step patterns.

## Input formats

### `csv`

A CSV file with a header row. Each column is an item of the survey:

```text
id,Q1,Q2,Q3
r1,1,2,3
r2,4,,5
```

A column is numeric when all its non-empty cells are numbers. Other columns (like
`id` above) must be excluded from the cleaning with `excludeColumns`.

### `excel`

An Excel spreadsheet (`.xlsx`), laid out like the CSV file. The first worksheet is
used, unless `excelWorksheetName` is provided.

Files without any data row, or with less than two columns, are rejected.

## Outputs

* the cleaned table (CSV), in the column order of the input. Restored rows come
  after the rows that passed all the checks.
* the removed rows (CSV), with their original row number in the `row` column.
* a summary (JSON) with the statistics of the selected columns, the flagged rows
  of each rule, and the number of rows kept.

Derived columns are appended at the end of the cleaned table:
* `{item}_r` for reverse-scored items: on a scale of `n` points, the value `v`
  becomes `n + 1 - v`.
* `{scale}_total` and `{scale}_mean` for each scale: the sum and the mean of the
  answers to the items of the scale.

## Configuration

`surveyclean` can be driven entirely from the command line, or from a job
description in JSON. The command line options override the job description.

```text
{
  "input": {
    "provider": "csv",
    "filePath": "answers.csv",
    "excludeColumns": ["id"]
  },
  "cleaning": {
    "scalePoints": 7,
    "straightLine": true,
    "missingValues": true,
    "outOfRange": true,
    "stepPattern": false,
    "keepRows": [3]
  },
  "manipulation": {
    "reverseColumns": ["Q2"],
    "includeOriginal": true,
    "scales": [{"name": "anxiety", "columns": ["Q1", "Q2_r"]}]
  },
  "output": {
    "cleanedPath": "cleaned.csv",
    "removedPath": "removed.csv",
    "summaryPath": "summary.json",
    "summaryColumns": ["Q1", "anxiety_mean"]
  }
}
```

Paths are relative to the location of the job description. All the sections
except `input` are optional.

 */
